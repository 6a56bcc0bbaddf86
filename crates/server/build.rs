fn main() -> Result<(), Box<dyn std::error::Error>> {
    // vendored protoc so the build does not depend on a system install
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    println!("cargo:rerun-if-changed=proto/order.proto");
    tonic_build::configure()
        .build_client(true)
        .compile_protos(&["proto/order.proto"], &["proto"])?;
    Ok(())
}
