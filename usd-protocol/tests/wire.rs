//! Byte-exact wire vectors shared with the node firmware

use usd_protocol::cobs;
use usd_protocol::crc16;
use usd_protocol::{
    decode_frame, encode_frame, CrcError, ErrorFlags, ErrorFlagsResponse, FrameDecoder,
    FrameError, Message, MoveToCommand, Packable, PositionResponse, Request, ResponseStatus,
    VersionResponse,
};

#[test]
fn test_crc_vectors() {
    assert_eq!(crc16::calculate(b"123456789"), 0x29B1);
    assert_eq!(crc16::calculate(&[0x00]), 0xE1F0);
    assert_eq!(crc16::calculate(&[]), 0xFFFF);
}

#[test]
fn test_cobs_vectors() {
    let vectors: &[(&[u8], &[u8])] = &[
        (&[], &[0x01]),
        (&[0x00], &[0x01, 0x01]),
        (&[0x00, 0x00], &[0x01, 0x01, 0x01]),
        (&[0x01, 0x02, 0x03], &[0x04, 0x01, 0x02, 0x03]),
        (&[0x01, 0x00, 0x02], &[0x02, 0x01, 0x02, 0x02]),
        (&[0x11, 0x22, 0x00], &[0x03, 0x11, 0x22, 0x01]),
    ];

    for (raw, encoded) in vectors {
        assert_eq!(cobs::encode(raw).unwrap().as_slice(), *encoded);
        assert_eq!(cobs::decode(encoded).unwrap().as_slice(), *raw);
    }
}

#[test]
fn test_ping_frame() {
    let frame = encode_frame(&Request::Ping.to_message()).unwrap();
    assert_eq!(frame.as_slice(), &[0x01, 0x01, 0x03, 0x0F, 0x1D, 0x00]);
}

#[test]
fn test_version_response_frame() {
    let response = VersionResponse {
        status: ResponseStatus::Ok,
        major: 0,
        minor: 3,
        patch: 0,
    }
    .to_response(0x00);
    assert_eq!(response.msg_id, 0x80);

    let frame = encode_frame(&response).unwrap();
    // [0x80, 0x04, 0x00, 0x00, 0x03, 0x00] + CRC
    let checked = cobs::unframe(&frame).unwrap();
    assert_eq!(&checked[..6], &[0x80, 0x04, 0x00, 0x00, 0x03, 0x00]);
    assert_eq!(crc16::check_and_strip(&checked).unwrap().len(), 6);
}

#[test]
fn test_move_to_frame() {
    let message = Request::MoveTo(MoveToCommand {
        position: 1000,
        velocity: 100,
        acceleration: 50,
    })
    .to_message();

    let frame = encode_frame(&message).unwrap();
    assert_eq!(
        frame.as_slice(),
        &[0x05, 0x10, 0x08, 0xE8, 0x03, 0x01, 0x02, 0x64, 0x02, 0x32, 0x03, 0xE5, 0x1A, 0x00]
    );
}

#[test]
fn test_position_response_decode() {
    let payload = [0x00, 0x18, 0xFC, 0xFF, 0xFF, 0x9C, 0xFF];
    let message = Message::response(0x40, &payload).unwrap();
    let frame = encode_frame(&message).unwrap();

    let decoded = decode_frame(&frame).unwrap();
    assert!(decoded.is_response());
    assert_eq!(decoded.request_id(), 0x40);

    let position = PositionResponse::from_message(&decoded).unwrap();
    assert_eq!(position.position, -1000);
    assert_eq!(position.velocity, -100);
}

#[test]
fn test_error_flags_response_decode() {
    let message = ErrorFlagsResponse {
        status: ResponseStatus::Ok,
        flags: ErrorFlags::OVERTEMP | ErrorFlags::COMM_TIMEOUT,
    }
    .to_response(0x43);
    let decoded = decode_frame(&encode_frame(&message).unwrap()).unwrap();

    let response = ErrorFlagsResponse::from_message(&decoded).unwrap();
    assert!(response.flags.contains(ErrorFlags::OVERTEMP));
    assert!(!response.flags.contains(ErrorFlags::ESTOP));
    assert_eq!(response.flags.bits(), 0x0088);
}

#[test]
fn test_stream_with_garbage_and_corruption() {
    let ping = encode_frame(&Request::Ping.to_message()).unwrap();
    let status = encode_frame(&Request::Status.to_message()).unwrap();

    let mut corrupted = encode_frame(&Request::GetTemp.to_message()).unwrap();
    // Flip a data bit inside the frame without creating a zero byte
    corrupted[1] ^= 0x01;
    assert!(corrupted[..corrupted.len() - 1].iter().all(|&b| b != 0));

    let mut stream = Vec::new();
    stream.extend_from_slice(&[0x00, 0x00]);
    stream.extend_from_slice(&ping);
    stream.extend_from_slice(&[0x7E, 0x7E, 0x00]);
    stream.extend_from_slice(&corrupted);
    stream.extend_from_slice(&status);

    let mut decoder = FrameDecoder::new();
    let mut results = Vec::new();
    decoder.feed_bytes(&stream, |result| results.push(result));

    assert_eq!(results.len(), 4);
    assert_eq!(results[0], Ok(Message::empty(0x00)));
    assert!(results[1].as_ref().unwrap_err().is_corruption());
    assert!(matches!(
        results[2],
        Err(FrameError::Crc(CrcError::Mismatch { .. }))
    ));
    assert_eq!(results[3], Ok(Message::empty(0x03)));

    let requests: Vec<_> = results
        .into_iter()
        .filter_map(Result::ok)
        .map(|message| Request::from_message(&message).unwrap())
        .collect();
    assert_eq!(requests, vec![Request::Ping, Request::Status]);
}
