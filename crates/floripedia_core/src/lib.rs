pub mod domain;
pub mod envelope;
pub mod filter;
pub mod ports;
pub mod query;
pub mod recency;
pub mod recognition;
pub mod validation;

pub use domain::{PlantSummary, RecentEntry, Token};
pub use envelope::{Envelope, ErrorKind, Failure};
pub use filter::{FilterAction, FilterAxis, FilterError, FilterSelection};
pub use ports::{AuthProvider, KeyValueStore, PlantApi, PortError, PortResult};
pub use query::{ListOptions, QueryParams, SortOrder};
pub use recency::RecentList;
