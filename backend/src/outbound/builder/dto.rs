//! Wire shape of the `POST /build-document` request body.

use serde::Serialize;

use crate::domain::ports::BuildDocumentPayload;

#[derive(Debug, Serialize)]
pub(super) struct BuildDocumentRequestDto<'a> {
    pub(super) code: &'a str,
    pub(super) instructions: &'a str,
    pub(super) format: &'static str,
    #[serde(rename = "abstract")]
    pub(super) abstract_text: &'a str,
    pub(super) project_info: &'a str,
    pub(super) uml_instructions: &'a str,
}

impl<'a> From<&'a BuildDocumentPayload> for BuildDocumentRequestDto<'a> {
    fn from(payload: &'a BuildDocumentPayload) -> Self {
        Self {
            code: payload.code.as_str(),
            instructions: payload.instructions.as_str(),
            format: payload.format.as_str(),
            abstract_text: payload.abstract_text.as_str(),
            project_info: payload.project_info.as_str(),
            uml_instructions: payload.uml_instructions.as_str(),
        }
    }
}
