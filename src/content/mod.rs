//! Localized email content for test results.
//!
//! The template is chosen from the outcome, region and text language of the
//! result. Rendering is pure: the same message always produces the same
//! subject and body.

pub mod helpers;
pub mod templates;

use std::fmt::Write;

use chrono_tz::Tz;
use tracing::debug;

use crate::{
    content::{
        helpers::{format_optional_date, redact_licence, test_type_name},
        templates::EmailTemplate,
    },
    error::ContentError,
    models::{
        content::EmailContent,
        message::{OverallStatus, ResultEvent},
    },
};

#[derive(Debug, Clone, Copy)]
pub struct ContentResolver {
    time_zone: Tz,
}

impl ContentResolver {
    pub fn new(time_zone: Tz) -> Self {
        Self { time_zone }
    }

    pub fn build_email_content(&self, event: &ResultEvent) -> Result<EmailContent, ContentError> {
        let information = &event.results.test_information;
        let template = templates::select(
            information.overall_status,
            event.target,
            information.text_language,
        );

        debug!(
            target_region = %event.target,
            outcome = ?information.overall_status,
            language = ?template.wording.language,
            "Rendering email content"
        );

        let subject = self.subject(&template, event);
        let body = self.body(&template, &subject, event)?;

        Ok(EmailContent { subject, body })
    }

    fn subject(&self, template: &EmailTemplate, event: &ResultEvent) -> String {
        let wording = template.wording;
        let information = &event.results.test_information;
        let test_type = test_type_name(information.test_type, information.text_language);

        format!(
            "{}{}{}",
            wording.subject_prefix, test_type, wording.subject_suffix
        )
    }

    fn body(
        &self,
        template: &EmailTemplate,
        subject: &str,
        event: &ResultEvent,
    ) -> Result<String, ContentError> {
        let wording = template.wording;
        let information = &event.results.test_information;
        // NI has English wording only, but names and dates keep the message language.
        let language = information.text_language;

        let test_date = format_optional_date(
            event.results.appointment.date_time.as_deref(),
            self.time_zone,
            language,
        )?;
        let expiry_date = if template.shows_expiry_date() {
            format_optional_date(
                information.certificate_expiry_date.as_deref(),
                self.time_zone,
                language,
            )?
        } else {
            None
        };
        let licence = redact_licence(&event.licence)?;
        let test_type = test_type_name(information.test_type, language);

        let outcome = match template.outcome {
            OverallStatus::Pass => wording.pass,
            OverallStatus::Fail => wording.fail,
        };

        // Writing into a String cannot fail.
        let mut body = String::new();
        let _ = writeln!(body, "# {}\n\n---\n", subject);
        let _ = writeln!(body, "{}: {}\n", wording.result_label, outcome);

        if template.outcome == OverallStatus::Pass {
            let _ = writeln!(body, "{}\n", wording.paper_certificate_note);
        }

        let _ = writeln!(body, "---\n");

        if let Some(date) = test_date {
            let _ = writeln!(body, "{}: {}", wording.test_date_label, date);
        }
        let _ = writeln!(body, "{}: {}", wording.test_type_label, test_type);
        let _ = writeln!(body, "{}: {}", wording.licence_label, licence);
        if let Some(date) = expiry_date {
            let _ = writeln!(body, "{}: {}", wording.expiry_date_label, date);
        }

        let _ = writeln!(body, "\n---\n");
        let _ = writeln!(body, "# {}\n", wording.survey_heading);
        let _ = writeln!(body, "{}\n", wording.survey_intro);
        let _ = writeln!(body, "{}", wording.survey_prompt);
        let _ = writeln!(body, "{}", template.survey_url);

        Ok(body)
    }
}
