//! Prompt construction for annotation requests.

use docweave_splice::Language;

use crate::client::{GenerateRequest, Message};
use crate::config::GenerationOptions;

/// System instruction sent with every annotation request
pub const SYSTEM_PROMPT: &str = "You are an expert documentation specialist. \
Your task is to insert appropriate documentation comments into existing code.";

/// Doc-format guidance for the given language
fn format_guidance(language: Language) -> &'static str {
    match language {
        Language::Ruby => {
            "For Ruby, use YARD format comments with @param, @return, @raise \
             and @example tags where they apply."
        }
        Language::Python => {
            "For Python, add docstrings to each function and class, and # \
             comments above module-level constants."
        }
        Language::JavaScript => {
            "For JavaScript, use JSDoc block comments with @param, @returns \
             and @throws tags where they apply."
        }
        Language::Unknown => {
            "Use the language's usual comment syntax for every documented element."
        }
    }
}

/// Build the annotation request for one chunk of a source unit.
///
/// The chunk travels inside a language-tagged fence and the response is
/// expected back the same way.
pub fn annotation_request(
    unit_name: &str,
    language: Language,
    chunk_text: &str,
    options: &GenerationOptions,
) -> GenerateRequest {
    let tag = if language.is_supported() {
        language.as_str()
    } else {
        ""
    };
    let prompt = format!(
        "Analyze this {lang} code from {unit}:\n\
         \n\
         ```{tag}\n\
         {code}\n\
         ```\n\
         \n\
         Insert documentation comments for every class, module, method, function, \
         and constant defined above.\n\
         {guidance}\n\
         \n\
         Ensure you:\n\
         1. Don't modify the actual code logic\n\
         2. Place each documentation comment directly above the relevant code element\n\
         3. Maintain proper indentation for the comments\n\
         4. Include all the original code\n\
         \n\
         Return just the fully annotated code in a single fenced code block.",
        lang = language.as_str(),
        unit = unit_name,
        tag = tag,
        code = chunk_text,
        guidance = format_guidance(language),
    );
    GenerateRequest::from_options(options)
        .system(SYSTEM_PROMPT)
        .message(Message::user(prompt))
}
