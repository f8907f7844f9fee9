// Service exports
pub mod colleagues;
pub mod pdf_batch;
pub mod renderer;
pub mod supabase;

pub use colleagues::{suggest_colleagues, ColleagueError};
pub use pdf_batch::{render_batch, validate_request, PdfBatchError, MAX_ITEMS, RENDER_FAILED_MESSAGE};
pub use renderer::{ChromiumRenderer, PdfRenderer, RenderError};
pub use supabase::{ScoreStore, StoreError, SupabaseClient, SupabaseTables};
