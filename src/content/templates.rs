use crate::models::message::{OverallStatus, Region, TextLanguage};

/// Fixed wording of one language.
pub struct Wording {
    pub language: TextLanguage,
    pub subject_prefix: &'static str,
    pub subject_suffix: &'static str,
    pub result_label: &'static str,
    pub pass: &'static str,
    pub fail: &'static str,
    pub paper_certificate_note: &'static str,
    pub test_date_label: &'static str,
    pub test_type_label: &'static str,
    pub licence_label: &'static str,
    pub expiry_date_label: &'static str,
    pub survey_heading: &'static str,
    pub survey_intro: &'static str,
    pub survey_prompt: &'static str,
}

pub static ENGLISH: Wording = Wording {
    language: TextLanguage::English,
    subject_prefix: "Your ",
    subject_suffix: " theory test result",
    result_label: "Test result",
    pass: "PASS",
    fail: "FAIL",
    paper_certificate_note: "This does not replace your paper certificate.",
    test_date_label: "Date of test",
    test_type_label: "Type of test",
    licence_label: "Licence number",
    expiry_date_label: "Expiry date",
    survey_heading: "Take our quick survey",
    survey_intro: "Your feedback helps us improve this service.",
    survey_prompt: "Tell us what you think at:",
};

pub static WELSH: Wording = Wording {
    language: TextLanguage::Welsh,
    subject_prefix: "Canlyniad eich prawf theori ",
    subject_suffix: "",
    result_label: "Canlyniad y prawf",
    pass: "PASIO",
    fail: "METHU",
    paper_certificate_note: "Nid yw hon yn disodli eich tystysgrif bapur.",
    test_date_label: "Dyddiad y prawf",
    test_type_label: "Math o brawf",
    licence_label: "Rhif trwydded",
    expiry_date_label: "Dyddiad Dod i ben",
    survey_heading: "Cymerwch ein harolwg cyflym",
    survey_intro: "Mae eich adborth yn ein helpu i wella'r gwasanaeth hwn.",
    survey_prompt: "Dywedwch wrthym eich barn ar wefan:",
};

pub const GB_SURVEY_URL: &str = "https://www.smartsurvey.co.uk/s/dvsa-theory-test-results/";
pub const GB_WELSH_SURVEY_URL: &str = "https://www.smartsurvey.co.uk/s/dvsa-theory-test-results-cy/";
pub const NI_SURVEY_URL: &str = "https://www.smartsurvey.co.uk/s/dva-theory-test-results/";

/// An email template for one (outcome, region, language) combination.
pub struct EmailTemplate {
    pub outcome: OverallStatus,
    pub wording: &'static Wording,
    pub survey_url: &'static str,
}

impl EmailTemplate {
    pub fn shows_expiry_date(&self) -> bool {
        self.outcome == OverallStatus::Pass
    }
}

/// Northern Ireland has no Welsh templates, so NI always gets English copy.
pub fn select(outcome: OverallStatus, region: Region, language: TextLanguage) -> EmailTemplate {
    let (wording, survey_url) = match (region, language) {
        (Region::Gb, TextLanguage::English) => (&ENGLISH, GB_SURVEY_URL),
        (Region::Gb, TextLanguage::Welsh) => (&WELSH, GB_WELSH_SURVEY_URL),
        (Region::Ni, TextLanguage::English | TextLanguage::Welsh) => (&ENGLISH, NI_SURVEY_URL),
    };

    EmailTemplate {
        outcome,
        wording,
        survey_url,
    }
}
