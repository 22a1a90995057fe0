//! End-to-end walks against a scripted, in-memory switch topology.

mod locate;
mod support;
mod walk;
