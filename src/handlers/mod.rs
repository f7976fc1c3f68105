// handlers/mod.rs - Two handler tiers
//
// Public (no auth) → Protected (bearer JWT, tenant context injected by middleware)

pub mod protected;
pub mod public;
