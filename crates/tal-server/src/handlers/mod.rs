//! Request handlers.
//!
//! GET  /api/health           - liveness
//! GET  /api/brand            - deployment branding and WhatsApp link
//! POST /api/chat-onboarding  - short onboarding lead
//! POST /api/lead             - full lead form
//! POST /api/register-lead    - company-scoped registration with AI summary
//! GET  /api/leads            - stored registrations (optional `companySlug`)

pub mod brand;
pub mod health;
pub mod intake;
pub mod leads;
