//! Property-based tests over random insertion sequences.
