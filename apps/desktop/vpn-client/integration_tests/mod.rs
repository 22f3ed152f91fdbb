// Integration tests for the VPN client session loop.
// A loopback WebSocket service stands in for the daemon.

mod session;
