#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Net(#[from] jgrpc_net::NetError),

    #[error(transparent)]
    Codec(#[from] jgrpc_codec::CodecError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
