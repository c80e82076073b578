pub mod application;
pub mod career;
pub mod history;
pub mod lenient;
pub mod profile;
pub mod qualification;
pub mod settings;

pub use application::{ApplicationProfile, Skill};
pub use career::CareerEntry;
pub use history::{HistoryEntry, HistoryKind};
pub use profile::Profile;
pub use qualification::QualificationEntry;
pub use settings::PaginationOptions;
