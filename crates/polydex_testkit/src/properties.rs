//! Property tests over random record sets and change batches.
