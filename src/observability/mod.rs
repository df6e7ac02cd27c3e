//! Observability: metrics and tracing.
//!
//! Allocation activity is exported through the `metrics` facade and logged
//! through `tracing`. Neither a recorder nor a subscriber is installed by this
//! crate; without one, recording is a no-op.
//!
//! ## Metrics
//!
//! | Metric | Type | Description |
//! |--------|------|-------------|
//! | `node_buffer_allocations` | Counter | Allocations, labelled by `strategy` |
//! | `node_buffer_bytes_allocated` | Counter | Bytes handed out to views |
//! | `node_buffer_slabs_created` | Counter | Pool slabs created |
//! | `node_buffer_slab_bytes` | Counter | Bytes reserved for pool slabs |
//! | `node_buffer_mappings_released` | Counter | Mapped blocks unmapped |
//! | `node_buffer_mapped_bytes_released` | Counter | Bytes returned by `munmap` |
//!
//! ## Tracing
//!
//! - `debug`: slab creation, anonymous mappings
//! - `trace`: unmap and external release
//! - `warn`: allocation failures, unknown encoding names under the lenient policy
//!
//! ## Example
//!
//! ```rust
//! use node_buffer::observability::init_metrics;
//!
//! // Describe metrics once at startup, then install any metrics exporter.
//! init_metrics();
//! ```

pub(crate) mod metrics;

pub use metrics::init_metrics;
