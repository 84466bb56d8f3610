//! Shared test harness modules for the Itinerant CLI.

use super::*;

mod helpers;
mod unit;
