//! Localized user-facing messages
//!
//! Every failure leg gets a distinct, legible message so repeated failures
//! are distinguishable by the user. The language affects these strings, not
//! the service call parameters.

use sahayak_core::Language;

/// Spoken/displayed apology when transcription fails
pub fn transcription_failed(language: Language) -> &'static str {
    match language {
        Language::Hindi => "माफ़ कीजिए, मैं सुन नहीं पाया। कृपया फिर से बोलिए।",
        Language::Marathi => "माफ करा, मला ऐकू आले नाही. कृपया पुन्हा बोला.",
        Language::English => "Sorry, I could not hear that. Please try again.",
    }
}

/// Spoken/displayed apology when the reasoning gate or assistant fails
pub fn reasoning_failed(language: Language) -> &'static str {
    match language {
        Language::Hindi => "माफ़ कीजिए, मैं अभी समझ नहीं पाया। कृपया थोड़ी देर बाद फिर से कोशिश कीजिए।",
        Language::Marathi => "माफ करा, मला आत्ता समजले नाही. कृपया थोड्या वेळाने पुन्हा प्रयत्न करा.",
        Language::English => "Sorry, I could not process that. Please try again in a moment.",
    }
}

/// Spoken/displayed message when the registration backend is unreachable
pub fn backend_unavailable(language: Language) -> &'static str {
    match language {
        Language::Hindi => "पंजीकरण सेवा से संपर्क नहीं हो पा रहा है। कृपया बाद में कोशिश कीजिए।",
        Language::Marathi => "नोंदणी सेवेशी संपर्क होत नाही. कृपया नंतर प्रयत्न करा.",
        Language::English => "The registration service cannot be reached. Please try again later.",
    }
}

/// Displayed apology when speech synthesis fails; the reply text itself is
/// still shown
pub fn synthesis_failed(language: Language) -> &'static str {
    match language {
        Language::Hindi => "माफ़ कीजिए, आवाज़ नहीं बन पाई। जवाब नीचे पढ़ सकते हैं।",
        Language::Marathi => "माफ करा, आवाज तयार होऊ शकला नाही. उत्तर खाली वाचू शकता.",
        Language::English => "Sorry, the voice reply could not be generated. Please read it below.",
    }
}

/// Wrap a domain error reported by the registration agent, spoken verbatim
pub fn backend_error(language: Language, message: &str) -> String {
    match language {
        Language::Hindi => format!("पंजीकरण में एक समस्या आई: {message}"),
        Language::Marathi => format!("नोंदणीत एक अडचण आली: {message}"),
        Language::English => format!("There was a problem with the registration: {message}"),
    }
}

/// Prompt asking the user to approve final submission
pub fn confirm_submission(language: Language) -> &'static str {
    match language {
        Language::Hindi => "क्या मैं आपका आवेदन जमा कर दूँ?",
        Language::Marathi => "मी तुमचा अर्ज सादर करू का?",
        Language::English => "Shall I submit your application?",
    }
}

/// Append a finite choice list as an enumerated spoken list
pub fn with_options(language: Language, message: &str, options: &[String]) -> String {
    if options.is_empty() {
        return message.to_string();
    }
    let label = match language {
        Language::Hindi => "विकल्प",
        Language::Marathi => "पर्याय",
        Language::English => "Option",
    };
    let list = options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{label} {}: {}.", i + 1, option))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{message} {list}")
}

/// Text shown while a turn is being processed
pub fn working(language: Language) -> &'static str {
    match language {
        Language::Hindi => "एक पल रुकिए...",
        Language::Marathi => "एक क्षण थांबा...",
        Language::English => "One moment...",
    }
}
