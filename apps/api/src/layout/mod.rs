// Pagination engine.
// Mode A (paginate) is pure and synchronous; Mode B (overflow) awaits a PageRenderer
// between every mutation and measurement.

pub mod advisor;
pub mod capacity;
pub mod font_metrics;
pub mod overflow;
pub mod page;
pub mod paginate;
pub mod renderer;
pub mod simulator;
pub mod warnings;

// Re-export the public API consumed by handlers and state.
pub use advisor::check_overflow;
pub use font_metrics::{default_page_config, FontFamily, PageConfig};
pub use overflow::{resolve_overflow, OverflowResolution};
pub use page::{page_label, Page, PageKind};
pub use paginate::{paginate, DocumentInput, PaginatedDocument, PaginatedDocuments};
pub use renderer::{PageRenderer, RenderError, SafeZone, SettlePolicy};
pub use simulator::SimulatedRenderer;
pub use warnings::LayoutWarning;
