use chrono::{DateTime, Datelike};
use chrono_tz::Tz;

use crate::{
    error::ContentError,
    models::message::{TestType, TextLanguage},
};

pub const VISIBLE_LICENCE_CHARS: usize = 4;

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WELSH_MONTHS: [&str; 12] = [
    "Ionawr",
    "Chwefror",
    "Mawrth",
    "Ebrill",
    "Mai",
    "Mehefin",
    "Gorffennaf",
    "Awst",
    "Medi",
    "Hydref",
    "Tachwedd",
    "Rhagfyr",
];

/// Masks all but the last four characters of a licence number with `*`.
/// Licence numbers shorter than four characters are rejected.
pub fn redact_licence(licence: &str) -> Result<String, ContentError> {
    let length = licence.chars().count();
    if length < VISIBLE_LICENCE_CHARS {
        return Err(ContentError::LicenceTooShort(length));
    }

    let hidden = length - VISIBLE_LICENCE_CHARS;

    Ok(licence
        .chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { '*' } else { c })
        .collect())
}

/// Formats an RFC 3339 timestamp as `DD Month YYYY` in `time_zone`.
pub fn format_full_date(
    timestamp: &str,
    time_zone: Tz,
    language: TextLanguage,
) -> Result<String, ContentError> {
    let local = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|source| ContentError::InvalidDate {
            value: timestamp.to_string(),
            source,
        })?
        .with_timezone(&time_zone);

    let months = match language {
        TextLanguage::English => &ENGLISH_MONTHS,
        TextLanguage::Welsh => &WELSH_MONTHS,
    };

    Ok(format!(
        "{:02} {} {}",
        local.day(),
        months[local.month0() as usize],
        local.year()
    ))
}

pub fn format_optional_date(
    timestamp: Option<&str>,
    time_zone: Tz,
    language: TextLanguage,
) -> Result<Option<String>, ContentError> {
    timestamp
        .map(|value| format_full_date(value, time_zone, language))
        .transpose()
}

pub fn test_type_name(test_type: TestType, language: TextLanguage) -> &'static str {
    use TestType::*;
    use TextLanguage::*;

    match (test_type, language) {
        (Car, _) => "car",
        (Motorcycle, English) => "motorcycle",
        (Motorcycle, Welsh) => "Beic modur",
        (LgvMc, English) => "LGV - multiple choice",
        (LgvMc, Welsh) => "LGV - aml-ddewis",
        (LgvHpt, English) => "LGV - hazard perception",
        (LgvHpt, Welsh) => "LGV - canfod peryglon",
        (LgvCpc, English) => "LGV - Driver Certificate of Professional Competence (CPC)",
        (LgvCpc, Welsh) => "LGV - Tystysgrif Cymhwysedd Proffesiynol ar gyfer Gyrwyr (CPC)",
        (LgvCpcC, English) => "LGV to PCV conversion",
        (LgvCpcC, Welsh) => "Trosi LGV i PCV",
        (PcvMc, English) => "PCV - multiple choice",
        (PcvMc, Welsh) => "PCV - aml-ddewis",
        (PcvHpt, English) => "PCV - hazard perception",
        (PcvHpt, Welsh) => "PCV - canfod peryglon",
        (PcvCpc, English) => "PCV - Driver Certificate of Professional Competence (CPC)",
        (PcvCpc, Welsh) => "PCV - Tystysgrif Cymhwysedd Proffesiynol ar gyfer Gyrwyr (CPC)",
        (PcvCpcC, English) => "PCV to LGV conversion",
        (PcvCpcC, Welsh) => "Trosi PCV i LGV",
        (Taxi, English) => "taxi",
        (Taxi, Welsh) => "Tacsi",
        (Adi1, English) => "ADI Part 1",
        (Adi1, Welsh) => "Rhan 1 Hyfforddwr Gyrru Cymeradwy (ADI)",
        (AdiHpt, English) => "ADI hazard perception",
        (AdiHpt, Welsh) => "Canfod peryglon (ADI)",
        (Ers, English) => "Enhanced Rider Scheme",
        (Ers, Welsh) => "Cynllun Gwella Beicwyr",
        (Ami1, English) => "AMI Part 1",
        (Ami1, Welsh) => "Rhan 1 Hyfforddwr Beic Modur Cymeradwy (AMI)",
        (ExaminerCar, _) => "Examiner car",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_keeps_length_and_last_four() {
        for licence in ["ABCD", "JONES061102W97YT", "12345", "ÅBCDEFG"] {
            let redacted = redact_licence(licence).unwrap();
            let chars: Vec<char> = licence.chars().collect();
            let redacted_chars: Vec<char> = redacted.chars().collect();

            assert_eq!(redacted_chars.len(), chars.len());
            assert_eq!(
                redacted_chars[chars.len() - 4..],
                chars[chars.len() - 4..],
                "last four characters should be visible for {licence}"
            );
            assert!(redacted_chars[..chars.len() - 4].iter().all(|c| *c == '*'));
        }
    }

    #[test]
    fn short_licence_is_rejected() {
        assert!(matches!(
            redact_licence("AB1"),
            Err(ContentError::LicenceTooShort(3))
        ));
    }

    #[test]
    fn date_is_shifted_into_time_zone() {
        let london = chrono_tz::Europe::London;

        assert_eq!(
            format_full_date("2022-09-12T23:30:00.000Z", london, TextLanguage::English).unwrap(),
            "13 September 2022"
        );
        assert_eq!(
            format_full_date("2022-01-05T10:00:00Z", london, TextLanguage::Welsh).unwrap(),
            "05 Ionawr 2022"
        );
    }
}
