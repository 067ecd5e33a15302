//! OID to name resolution.
//!
//! A queried OID usually carries an instance suffix the MIB does not know
//! about (`sysName.0`, `ifDescr.10`, `metricValue.10.42`). Resolution finds
//! the longest loaded prefix and renders the rest as a bracketed index.
//!
//! - [`prefix`] holds the pure matching algorithm
//! - [`ResolutionCache`] holds the node, base-name and label caches
//! - [`OidResolver`] layers the cache over the algorithm

mod cache;
pub mod prefix;
mod resolver;

pub use cache::{CacheStats, ResolutionCache};
pub use prefix::{find_longest_prefix_match, format_label, PrefixMatch};
pub use resolver::OidResolver;
