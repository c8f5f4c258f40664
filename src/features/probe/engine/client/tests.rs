use super::TransferHandler;
use curl::easy::Handler;
use std::time::Duration;

#[test]
fn transfer_handler_counts_received_bytes() {
    let mut handler = TransferHandler::default();
    handler.reset(0);
    let data = vec![0u8; 8];
    assert_eq!(handler.write(&data).expect("write"), 8);
    assert_eq!(handler.write(&data[..3]).expect("write"), 3);
    assert_eq!(handler.received, 11);
}

#[test]
fn transfer_handler_reads_exact_upload_size() {
    let mut handler = TransferHandler::default();
    handler.reset(10);
    let mut buf = [1u8; 6];

    assert_eq!(handler.read(&mut buf).expect("read"), 6);
    assert_eq!(buf, [0u8; 6]);
    assert_eq!(handler.read(&mut buf).expect("read"), 4);
    assert_eq!(handler.read(&mut buf).expect("read"), 0);
}

#[test]
fn transfer_handler_keeps_server_timing_header() {
    let mut handler = TransferHandler::default();
    handler.reset(0);
    assert!(handler.header(b"HTTP/1.1 200 OK\r\n"));
    assert!(handler.header(b"server-timing: cfRequestDuration;dur=4\r\n"));
    assert!(handler.header(b"content-length: 0\r\n"));
    assert_eq!(handler.server_timing, Some(Duration::from_millis(4)));
}

#[test]
fn transfer_handler_reset_clears_previous_transfer() {
    let mut handler = TransferHandler::default();
    handler.reset(0);
    let _ = handler.write(&[0u8; 5]).expect("write");
    let _ = handler.header(b"Server-Timing: dur=2\r\n");

    handler.reset(3);
    assert_eq!(handler.received, 0);
    assert_eq!(handler.upload_remaining, 3);
    assert!(handler.server_timing.is_none());
}
