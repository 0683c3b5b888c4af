//! Letter requests, their per-type forms, and citizen notifications.

pub mod domain;
pub mod forms;

pub use domain::{
    LetterRequest, LetterRequestDraft, LetterRequestId, LetterType, Notification,
    NotificationDraft, NotificationId, RequestStatus, UnknownCode,
};
pub use forms::{
    Citizenship, ExtraField, FieldSpec, Gender, LetterDetails, LetterForm, LetterFormData,
    MaritalStatus, Religion, VerificationData, VerificationForm, VerifiedIdentity,
};
