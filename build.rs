fn main() -> Result<(), Box<dyn std::error::Error>> {
    // the messages are prost derives in src/grpc/rpc.rs, so no .proto or protoc is involved
    let ping = tonic_build::manual::Method::builder()
        .name("ping")
        .route_name("Ping")
        .input_type("crate::grpc::rpc::PingRequest")
        .output_type("crate::grpc::rpc::PingReply")
        .codec_path("tonic::codec::ProstCodec")
        .build();

    let echo = tonic_build::manual::Service::builder()
        .name("Echo")
        .package("echo")
        .method(ping)
        .build();

    tonic_build::manual::Builder::new()
        .build_client(true)
        .build_server(true)
        .compile(&[echo]);
    Ok(())
}
