fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = prost_build::Config::new();
    config.protoc_executable(protoc_bin_vendored::protoc_bin_path()?);

    println!("cargo:rerun-if-changed=proto/");

    let proto_files = [
        "proto/admin_service.proto",
        "proto/student_service.proto",
        "proto/task_service.proto",
    ];

    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        // Messages double as the JSON shapes of the HTTP surface.
        .type_attribute(
            ".",
            "#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]",
        )
        // Every other scalar field must be present in a request body.
        .field_attribute(".task_service.CreateTask.description", "#[serde(default)]")
        .field_attribute(".task_service.CreateTask.external_id", "#[serde(default)]")
        .field_attribute(".task_service.UpdateTask.description", "#[serde(default)]")
        .compile_protos_with_config(config, &proto_files, &["proto/"])?;

    Ok(())
}
