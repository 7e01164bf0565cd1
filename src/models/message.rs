use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Number;

use crate::error::ContentError;

/// Inbound test result message, one per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEvent {
    pub booking_id: String,
    pub email: String,
    pub licence: String,
    pub target: Region,
    pub results: ResultBody,
    pub tracing: Tracing,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tracing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "AppointmentId", default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,

    #[serde(rename = "bookingProductId")]
    pub booking_product_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Gb,
    Ni,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Gb => "gb",
            Region::Ni => "ni",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultBody {
    pub candidate: Candidate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission: Option<Admission>,

    pub appointment: Appointment,
    pub test_centre: TestCentre,
    pub test_information: TestInformation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Candidate {
    #[serde(rename = "CandidateID")]
    pub candidate_id: String,
    pub name: String,
    pub surname: String,

    #[serde(rename = "DOB", default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_license_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Admission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestCentre {
    pub test_centre_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Code>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_expiry_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_mode: Option<Code>,

    pub test_type: TestType,
    pub text_language: TextLanguage,
    pub overall_status: OverallStatus,

    #[serde(rename = "CertificationID", default, skip_serializing_if = "Option::is_none")]
    pub certification_id: Option<String>,

    pub end_time: String,
}

/// A small integer code from the result body. The schemas type these as
/// `integer`, which also admits whole floats such as `1.0`, so those decode too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Code(pub u8);

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = Number::deserialize(deserializer)?;

        let code = match number.as_u64() {
            Some(value) => u8::try_from(value).ok(),
            None => number
                .as_f64()
                .filter(|value| value.fract() == 0.0 && (0.0..=255.0).contains(value))
                .map(|value| value as u8),
        };

        code.map(Code)
            .ok_or_else(|| D::Error::custom(format!("invalid code {number}, expected 0-255")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Code", into = "u8")]
pub enum OverallStatus {
    Fail,
    Pass,
}

impl TryFrom<u8> for OverallStatus {
    type Error = ContentError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OverallStatus::Fail),
            1 => Ok(OverallStatus::Pass),
            other => Err(ContentError::UnknownCode {
                field: "OverallStatus",
                code: other,
            }),
        }
    }
}

impl TryFrom<Code> for OverallStatus {
    type Error = ContentError;

    fn try_from(code: Code) -> Result<Self, Self::Error> {
        Self::try_from(code.0)
    }
}

impl From<OverallStatus> for u8 {
    fn from(status: OverallStatus) -> Self {
        match status {
            OverallStatus::Fail => 0,
            OverallStatus::Pass => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Code", into = "u8")]
pub enum TextLanguage {
    English,
    Welsh,
}

impl TryFrom<u8> for TextLanguage {
    type Error = ContentError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TextLanguage::English),
            1 => Ok(TextLanguage::Welsh),
            other => Err(ContentError::UnknownCode {
                field: "TextLanguage",
                code: other,
            }),
        }
    }
}

impl TryFrom<Code> for TextLanguage {
    type Error = ContentError;

    fn try_from(code: Code) -> Result<Self, Self::Error> {
        Self::try_from(code.0)
    }
}

impl From<TextLanguage> for u8 {
    fn from(language: TextLanguage) -> Self {
        match language {
            TextLanguage::English => 0,
            TextLanguage::Welsh => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Code", into = "u8")]
pub enum TestType {
    Car,
    Motorcycle,
    LgvMc,
    LgvHpt,
    LgvCpc,
    LgvCpcC,
    PcvMc,
    PcvHpt,
    PcvCpc,
    PcvCpcC,
    Taxi,
    Adi1,
    AdiHpt,
    Ers,
    Ami1,
    ExaminerCar,
}

impl TestType {
    pub const ALL: [TestType; 16] = [
        TestType::Car,
        TestType::Motorcycle,
        TestType::LgvMc,
        TestType::LgvHpt,
        TestType::LgvCpc,
        TestType::LgvCpcC,
        TestType::PcvMc,
        TestType::PcvHpt,
        TestType::PcvCpc,
        TestType::PcvCpcC,
        TestType::Taxi,
        TestType::Adi1,
        TestType::AdiHpt,
        TestType::Ers,
        TestType::Ami1,
        TestType::ExaminerCar,
    ];
}

impl TryFrom<u8> for TestType {
    type Error = ContentError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        TestType::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(ContentError::UnknownCode {
                field: "TestType",
                code,
            })
    }
}

impl TryFrom<Code> for TestType {
    type Error = ContentError;

    fn try_from(code: Code) -> Result<Self, Self::Error> {
        Self::try_from(code.0)
    }
}

impl From<TestType> for u8 {
    fn from(test_type: TestType) -> Self {
        test_type as u8
    }
}
