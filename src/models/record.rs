//! RESH history record as exchanged on the wire and stored in `records`.

use crate::utils::time::Timestamp;
use serde::{Deserialize, Serialize};

/// One shell command invocation.
///
/// Optional fields stay `None` when the client did not send them; they are
/// omitted on output and stored as `NULL`, never as a zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "RecordID")]
    pub record_id: String,
    #[serde(rename = "DeviceID")]
    pub device_id: String,
    #[serde(rename = "SessionID")]
    pub session_id: String,
    #[serde(rename = "CmdLine")]
    pub cmd_line: String,

    #[serde(rename = "ExitCode", default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(rename = "Time")]
    pub time: Timestamp,
    #[serde(rename = "Flags", default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<i32>,

    #[serde(rename = "Home", default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(rename = "Pwd", default, skip_serializing_if = "Option::is_none")]
    pub pwd: Option<String>,
    #[serde(rename = "RealPwd", default, skip_serializing_if = "Option::is_none")]
    pub real_pwd: Option<String>,
    #[serde(rename = "Device", default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(
        rename = "GitOriginRemote",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub git_origin_remote: Option<String>,
    #[serde(rename = "Duration", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(rename = "PartOne", default, skip_serializing_if = "Option::is_none")]
    pub part_one: Option<bool>,
    #[serde(
        rename = "PartsNotMerged",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parts_not_merged: Option<bool>,
    #[serde(rename = "SessionExit", default, skip_serializing_if = "Option::is_none")]
    pub session_exit: Option<bool>,
}

impl Record {
    /// Record with only the required fields set.
    pub fn new(
        record_id: impl Into<String>,
        device_id: impl Into<String>,
        session_id: impl Into<String>,
        cmd_line: impl Into<String>,
        time: Timestamp,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            device_id: device_id.into(),
            session_id: session_id.into(),
            cmd_line: cmd_line.into(),
            exit_code: None,
            time,
            flags: None,
            home: None,
            pwd: None,
            real_pwd: None,
            device: None,
            git_origin_remote: None,
            duration: None,
            part_one: None,
            parts_not_merged: None,
            session_exit: None,
        }
    }
}
