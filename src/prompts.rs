// Contains the fixed prompt strings for summary requests.

/// Instruction message sent with every request. Pins the output format to
/// HTML markup so the result can be dropped into the result pane verbatim.
pub const SUMMARY_INSTRUCTION: &str = "You are a summarizer. Summarize the text the user \
sends in a few short paragraphs. Respond with HTML markup only: wrap paragraphs in <p>, \
use <b> for key terms and <ul>/<li> for enumerations. Do not include anything besides \
the summary itself.";

/// Prefix for the user message; the raw selection or page text is appended
/// literally, unescaped.
pub const USER_PREFIX: &str = "Please summarize the following text: ";
