// Listener module
// Binds the server socket with address reuse enabled

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind a non-blocking `TcpListener` on `addr`
///
/// # Arguments
///
/// * `addr` - The socket address to bind to
/// * `backlog` - Pending connection queue size passed to `listen`
pub fn bind_listener(addr: SocketAddr, backlog: i32) -> std::io::Result<TcpListener> {
    // Create socket with appropriate domain (IPv4 or IPv6)
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR: a restarted process can bind while old connections
    // are still in TIME_WAIT
    socket.set_reuse_address(true)?;

    // SO_REUSEPORT: several sockets may share the port (Unix only)
    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    // Non-blocking mode is required by the tokio reactor
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(backlog)?;

    // socket2::Socket -> std::net::TcpListener -> tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
