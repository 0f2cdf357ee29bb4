//! Domain Layer
//!
//! Business logic with no infrastructure dependencies:
//!
//! - **Aggregates**: consistency boundaries with invariants
//! - **Value Objects**: immutable types compared by value
//! - **Domain Services**: stateless business rules
//! - **Registry Traits**: ownership abstractions implemented by adapters
//!
//! # Bounded Contexts
//!
//! - [`order_execution`]: order lifecycle, fills and reconciliation
//! - [`portfolio`]: signed positions per symbol
//! - [`risk_management`]: pre-trade position limit

pub mod order_execution;
pub mod portfolio;
pub mod risk_management;
pub mod shared;
