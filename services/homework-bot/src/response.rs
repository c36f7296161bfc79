//! Validation of review API responses and status extraction

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::BotError;

/// Review status of a homework submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable verdict shown to the student
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomeworkStatus::Approved => write!(f, "approved"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(BotError::UnknownHomeworkStatus(other.to_string())),
        }
    }
}

/// A response that passed [`check_response`]
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedResponse {
    /// Most recent first; empty means nothing changed since the cursor
    pub homeworks: Vec<Value>,
    /// Server-side cursor for the next request, when it is an integer
    pub current_date: Option<i64>,
}

/// Name of a JSON value's type, in the vocabulary used by error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Check the decoded body has the expected shape and return its homeworks.
pub fn check_response(response: &Value) -> crate::Result<CheckedResponse> {
    let body = response.as_object().ok_or(BotError::WrongArrayType {
        expected: "dict",
        got: json_type_name(response),
    })?;

    let homeworks = body
        .get("homeworks")
        .ok_or_else(|| BotError::ApiResponseKey("homeworks".to_string()))?;
    let current_date = body
        .get("current_date")
        .ok_or_else(|| BotError::ApiResponseKey("current_date".to_string()))?;

    let homeworks = homeworks.as_array().ok_or(BotError::WrongArrayType {
        expected: "list",
        got: json_type_name(homeworks),
    })?;

    if let Some(first) = homeworks.first() {
        if !first.is_object() {
            return Err(BotError::CheckResponse(format!(
                "homework entries must be dict, got {}",
                json_type_name(first)
            )));
        }
    }

    tracing::debug!("Received {} homework(s)", homeworks.len());
    Ok(CheckedResponse {
        homeworks: homeworks.clone(),
        current_date: current_date.as_i64(),
    })
}

/// Build the notification text for a single homework entry.
pub fn parse_status(homework: &Value) -> crate::Result<String> {
    let homework_name = string_field(homework, "homework_name")?;
    let status: HomeworkStatus = string_field(homework, "status")?.parse()?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework_name,
        status.verdict()
    ))
}

fn string_field<'a>(homework: &'a Value, key: &str) -> crate::Result<&'a str> {
    let entry = homework.as_object().ok_or(BotError::WrongArrayType {
        expected: "dict",
        got: json_type_name(homework),
    })?;
    let value = entry
        .get(key)
        .ok_or_else(|| BotError::ApiResponseKey(key.to_string()))?;
    value.as_str().ok_or(BotError::WrongArrayType {
        expected: "str",
        got: json_type_name(value),
    })
}
