fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Ensure a protoc binary is available even when one isn't installed
    // system-wide by pointing at the vendored compiler.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(protoc) = protoc_bin_vendored::protoc_bin_path() {
            unsafe {
                std::env::set_var("PROTOC", protoc);
            }
        }
    }

    // Compile the proto file for the quote service
    tonic_build::compile_protos("../../proto/quotes.proto")?;
    Ok(())
}
