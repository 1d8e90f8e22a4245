//! # Gateway Proto
//!
//! Generated gRPC clients and messages for the backend services.
//! Every message also derives `serde` traits so the gateway can decode HTTP
//! bodies straight into request messages and encode replies as JSON, and
//! `utoipa::ToSchema` so the same messages document the HTTP surface.
//!
//! Scalar fields are required in JSON unless the build script marks them
//! `#[serde(default)]`; nested messages are optional.

pub mod admin_service {
    tonic::include_proto!("admin_service");
}

pub mod student_service {
    tonic::include_proto!("student_service");
}

pub mod task_service {
    tonic::include_proto!("task_service");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_rejected() {
        let err = serde_json::from_str::<admin_service::CreateAdmin>(r#"{"email": "jane@example.com"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("missing field `full_name`"));
    }

    #[test]
    fn test_task_description_defaults() {
        let req: task_service::CreateTask =
            serde_json::from_str(r#"{"title": "Grade", "owner_id": "u-1"}"#).unwrap();
        assert!(req.description.is_empty());
        assert!(req.external_id.is_empty());
    }

    #[test]
    fn test_nested_message_is_optional() {
        let req: student_service::StudentRegisterConfRequest =
            serde_json::from_str(r#"{"email": "a@b.co", "otp": "1234"}"#).unwrap();
        assert!(req.student.is_none());
    }

    #[test]
    fn test_reply_serializes_field_names() {
        let task = task_service::Task {
            id: "t1".into(),
            status: "done".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["status"], "done");
    }
}
