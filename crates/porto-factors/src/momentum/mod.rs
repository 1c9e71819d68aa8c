//! Momentum factors - measures of trend persistence
//!
//! Price changes between month-start dates: five lookbacks ending at the
//! snapshot month and the forward return over the following year.

pub mod calendar_momentum;

pub use calendar_momentum::{
    CalendarMomentumConfig, CalendarMomentumFactor, FORWARD_MONTHS, LOOKBACK_MONTHS,
    MomentumRecord,
};
