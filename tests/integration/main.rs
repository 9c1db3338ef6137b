//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem against
//! mock hardware on real threads. All tests run on the host with no
//! hardware required, and every wait is bounded.

mod button_flow_tests;
mod mock_hw;
mod pipeline_tests;
