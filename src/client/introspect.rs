use std::net::SocketAddr;

/// A client handle that can report the server address it is connected to.
///
/// Client libraries rarely expose this, so bindings for test clients
/// implement it on top of whatever diagnostic accessor they offer.
pub trait ConnectedClient {
    /// Remote address of the live connection, `None` while disconnected
    fn remote_socket_address(&self) -> Option<SocketAddr>;
}

impl ConnectedClient for tokio::net::TcpStream {
    fn remote_socket_address(&self) -> Option<SocketAddr> {
        self.peer_addr().ok()
    }
}

impl ConnectedClient for std::net::TcpStream {
    fn remote_socket_address(&self) -> Option<SocketAddr> {
        self.peer_addr().ok()
    }
}

impl<T> ConnectedClient for Option<T>
where
    T: ConnectedClient,
{
    fn remote_socket_address(&self) -> Option<SocketAddr> {
        self.as_ref().and_then(ConnectedClient::remote_socket_address)
    }
}
