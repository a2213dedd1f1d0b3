//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (model providers, the desired-state store, control surfaces).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!     ┌──────────────┤  Registry + Reconciler  ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │  Chat   │            │   Desired   │              │  Trading  │
//! │Transport│            │    State    │              │   Cycle   │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod inbound;
pub mod outbound;

pub use inbound::admin::FleetAdmin;
pub use outbound::cycle::{CycleContext, CycleFactory, TradingCycle};
pub use outbound::llm::{ChatCompletion, ChatMessage, ChatRequest, ChatTransport, Role, Usage};
pub use outbound::store::DesiredStateSource;
