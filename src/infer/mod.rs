//! Foreign-key relationship inference from column naming conventions.
//!
//! Four heuristics propose candidate links between columns of different
//! tables, each with a fixed confidence:
//!
//! | Strategy | Example | Confidence |
//! |---|---|---|
//! | `_id` suffix | `orders.user_id` -> `users.id` | 0.95 |
//! | exact name | `ledger.cust_no` (key) -> `customer.cust_no` | 0.85 (0.8 unkeyed) |
//! | legacy prefix | `O0.O0BCTN` -> `O1.O1BCTN` | 0.7 |
//! | camelCase `Id` | `products.id` -> `orders.productId` | 0.6 |
//!
//! Candidates for the same column pair collapse to the most confident one.

mod candidate;
mod engine;
mod marker;
mod naming;

pub use candidate::{Match, Strategy};
pub use engine::{RelationshipInferrer, infer_relationships};
pub use marker::mark_foreign_keys;
pub use naming::{column_suffix, pluralize, singularize};
