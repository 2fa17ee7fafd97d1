mod error;
mod interface;
mod invocation;
mod models;
mod registry;

pub use error::{InvocationError, ToolInvokeError};
pub use interface::{CustomerLookup, CustomerRecord, Guideline, KbArticle, KnowledgeBase, PlanTier};
pub use invocation::{FETCH_CUSTOMER_DATA, QUERY_KNOWLEDGE_BASE, ToolInvocation, decode_arguments};
pub use models::{DEFAULT_PLAN, PlanDetails, ToolOutcome, customer_plan};
pub use registry::{DEFAULT_KB_RESULTS, ToolRegistry};
