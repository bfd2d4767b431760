//! Build script for identity-rpc.
//!
//! Generates the tonic client and server for `proto/identity.proto` using the
//! vendored `protoc`, so builds do not depend on a system install.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/identity.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
