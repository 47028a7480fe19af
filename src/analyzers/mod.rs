//! Interest collection and ranking on top of a [`crate::trends::TrendsSource`].
//!
//! [`batch::collect_batched`] queries brands in fixed-size groups and joins
//! the tables; [`season::analyze_seasons`] ranks brands per fashion week;
//! [`related::collect_related`] gathers associated searches. Waiting between
//! queries is delegated to a [`pacing::Pacer`].

pub mod batch;
pub mod pacing;
pub mod related;
pub mod season;
pub mod types;
pub mod utility;

#[cfg(test)]
pub(crate) mod testing;
