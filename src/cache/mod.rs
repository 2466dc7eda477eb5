//! Caching subsystem.
//!
//! The data layer keeps four independent caches, all owned by
//! [`Pokedex`](crate::Pokedex):
//!
//! - the listing cache — [`LruCache`] keyed by *position* within the
//!   declared total (1-based), holding page summaries. Positions rather
//!   than ids, because the remote collection's ids are not guaranteed
//!   to be densely packed from 1.
//!
//! - the detail cache — [`LruCache`] keyed by pokemon id, holding full
//!   [`Pokemon`](crate::Pokemon) records.
//!
//! - the type index map — a plain `HashMap` of per-type member id lists.
//!   There are at most 18 type tags, so no eviction is applied.
//!
//! - the type item cache — [`LruCache`] keyed by `(type, id)`, holding
//!   summaries loaded through type-filtered pagination. The tag component
//!   is redundant today (ids are globally unique) but keeps per-filter
//!   entries independent should they ever diverge.
//!
//! Entries are created on first successful fetch and removed only by LRU
//! eviction or a full `clear()`; none of the caches persist across runs.

pub mod lru;

pub use lru::LruCache;
