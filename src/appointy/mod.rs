//! Wire-level access to the Appointy backend: transport, GraphQL
//! documents and the packed payload codec.

pub mod codec;
pub mod queries;
pub mod transport;

pub use codec::DurationSecs;
pub use queries::{AvailabilityFilter, GraphqlOperation, TimeSlot};
pub use transport::Transport;
