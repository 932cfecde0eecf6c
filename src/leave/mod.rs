//! Leave request lifecycle: drafting, submission and manager decisions.

pub mod approval;
pub mod attachment;
pub mod book;
pub mod draft;

#[cfg(test)]
mod tests;

pub use approval::{ApprovalDesk, Decision, PreparedDecision};
pub use attachment::{ALLOWED_EXTENSIONS, Attachment, AttachmentError, MAX_ATTACHMENT_BYTES};
pub use book::LeaveBook;
pub use draft::{LeaveDraft, LeaveField, NewLeaveRequest, ValidationErrors, submit};
