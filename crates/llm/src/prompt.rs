//! System prompts, greetings and the sufficiency sentinel

use sahayak_core::Language;

/// Exact token the reasoning gate must output to signal "proceed to backend".
/// Any other output, including text that merely contains this token, is
/// treated as a clarification.
pub const SUFFICIENCY_SENTINEL: &str = "BACKEND_READY";

/// System instruction seeding every session
pub fn system_prompt(scheme: Option<&str>, language: Language) -> String {
    let lang_line = language_line(language);
    match scheme {
        Some(scheme) => format!(
            "You are Sahayak, a voice assistant guiding an Indian citizen through \
             the registration interview for the {scheme} government scheme. \
             Keep answers short and speakable. {lang_line}"
        ),
        None => format!(
            "You are Sahayak, a helpful voice assistant answering questions about \
             Indian government schemes, documents and eligibility. \
             Keep answers short and speakable. {lang_line}"
        ),
    }
}

/// Fixed spoken greeting for a scheme session with empty history
pub fn greeting(scheme: &str, language: Language) -> String {
    match (scheme, language) {
        ("PMFBY", Language::Hindi) => {
            "नमस्ते! मैं प्रधानमंत्री फसल बीमा योजना के पंजीकरण में आपकी मदद करूँगा। \
             शुरू करने के लिए बताइए, आप कौन सी फसल का बीमा कराना चाहते हैं?"
                .to_string()
        }
        ("PMFBY", Language::Marathi) => {
            "नमस्कार! प्रधानमंत्री पीक विमा योजनेच्या नोंदणीत मी तुम्हाला मदत करेन. \
             सुरुवात करण्यासाठी सांगा, तुम्हाला कोणत्या पिकाचा विमा काढायचा आहे?"
                .to_string()
        }
        ("PMFBY", Language::English) => {
            "Namaste! I will help you register for the Pradhan Mantri Fasal Bima \
             Yojana. To begin, which crop would you like to insure?"
                .to_string()
        }
        (scheme, Language::English) => format!(
            "Namaste! I will help you register for the {scheme} scheme. \
             Shall we begin?"
        ),
        (scheme, _) => format!(
            "नमस्ते! मैं {scheme} योजना के पंजीकरण में आपकी मदद करूँगा। क्या हम शुरू करें?"
        ),
    }
}

/// Instruction for the reasoning gate
///
/// The gate must reply with exactly [`SUFFICIENCY_SENTINEL`] when the
/// utterance answers the pending question, and otherwise reply with a short
/// clarifying question that will be spoken back verbatim.
pub fn gate_instruction(pending_request: Option<&str>, language: Language) -> String {
    let lang_line = language_line(language);
    let pending = match pending_request {
        Some(question) => format!("The registration agent is waiting for an answer to: \"{question}\"."),
        None => "The registration agent has not asked anything yet; any on-topic \
                 statement counts as sufficient."
            .to_string(),
    };
    format!(
        "You judge whether the user's spoken reply sufficiently answers the \
         pending registration question. {pending} \
         If the reply is a sufficient answer, respond with exactly \
         {SUFFICIENCY_SENTINEL} and nothing else. \
         Otherwise respond with one short clarifying question for the user. \
         {lang_line}"
    )
}

fn language_line(language: Language) -> &'static str {
    match language {
        Language::Hindi => "Respond in Hindi.",
        Language::Marathi => "Respond in Marathi.",
        Language::English => "Respond in simple Indian English.",
    }
}
