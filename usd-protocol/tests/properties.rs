//! Property tests for the codec layers

use proptest::collection::vec;
use proptest::prelude::*;

use usd_protocol::cobs::{self, COBS_MAX_INPUT_SIZE};
use usd_protocol::crc16::{self, CRC16_INIT};
use usd_protocol::{
    decode_frame, encode_frame, FrameDecoder, Message, MAX_FRAMED_PAYLOAD_SIZE, MAX_PAYLOAD_SIZE,
    MSG_ID_RESPONSE_BIT,
};

proptest! {
    #[test]
    fn cobs_roundtrip(data in vec(any::<u8>(), 0..=COBS_MAX_INPUT_SIZE)) {
        let encoded = cobs::encode(&data).unwrap();
        prop_assert!(!encoded.contains(&0));
        let decoded = cobs::decode(&encoded).unwrap();
        prop_assert_eq!(decoded.as_slice(), data.as_slice());
    }

    #[test]
    fn cobs_frame_roundtrip(data in vec(any::<u8>(), 0..=COBS_MAX_INPUT_SIZE)) {
        let framed = cobs::frame(&data).unwrap();
        prop_assert_eq!(framed.iter().filter(|&&b| b == 0).count(), 1);
        prop_assert_eq!(framed.last(), Some(&0));
        let unframed = cobs::unframe(&framed).unwrap();
        prop_assert_eq!(unframed.as_slice(), data.as_slice());
    }

    #[test]
    fn crc_update_matches_calculate(data in vec(any::<u8>(), 0..512), split in any::<prop::sample::Index>()) {
        let at = split.index(data.len() + 1);
        let (head, tail) = data.split_at(at);
        let crc = crc16::update(crc16::update(CRC16_INIT, head), tail);
        prop_assert_eq!(crc, crc16::calculate(&data));
    }

    #[test]
    fn crc_detects_single_byte_corruption(
        data in vec(any::<u8>(), 1..=250),
        pos in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let mut checked = crc16::append(&data).unwrap();
        prop_assert_eq!(crc16::check_and_strip(&checked).unwrap(), data.as_slice());

        let at = pos.index(checked.len());
        checked[at] ^= flip;
        prop_assert!(crc16::check_and_strip(&checked).is_err());
    }

    #[test]
    fn message_roundtrip(msg_id in any::<u8>(), payload in vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE)) {
        let message = Message::new(msg_id, &payload).unwrap();
        let packed = message.pack();
        prop_assert_eq!(packed.len(), 2 + payload.len());
        prop_assert_eq!(Message::unpack_strict(&packed).unwrap(), message);
    }

    #[test]
    fn response_bit_algebra(request_id in 0u8..=0x7F) {
        let request = Message::empty(request_id);
        let response = Message::empty(request_id | MSG_ID_RESPONSE_BIT);

        prop_assert!(!request.is_response());
        prop_assert!(response.is_response());
        prop_assert_eq!(request.request_id(), request_id);
        prop_assert_eq!(response.request_id(), request_id);
    }

    #[test]
    fn frame_roundtrip(msg_id in any::<u8>(), payload in vec(any::<u8>(), 0..=MAX_FRAMED_PAYLOAD_SIZE)) {
        let message = Message::new(msg_id, &payload).unwrap();
        let frame = encode_frame(&message).unwrap();

        prop_assert_eq!(frame.iter().filter(|&&b| b == 0).count(), 1);
        prop_assert_eq!(decode_frame(&frame).unwrap(), message);
    }

    #[test]
    fn stream_decoder_yields_every_frame(
        messages in vec((any::<u8>(), vec(any::<u8>(), 0..=32)), 1..8),
        chunk in 1usize..64,
    ) {
        let mut stream = Vec::new();
        let mut expected = Vec::new();
        for (msg_id, payload) in &messages {
            let message = Message::new(*msg_id, payload).unwrap();
            stream.extend_from_slice(&encode_frame(&message).unwrap());
            expected.push(message);
        }

        let mut decoder = FrameDecoder::new();
        let mut decoded = Vec::new();
        for piece in stream.chunks(chunk) {
            decoder.feed_bytes(piece, |result| decoded.push(result.unwrap()));
        }

        prop_assert_eq!(decoded, expected);
        prop_assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn decoder_survives_arbitrary_input(noise in vec(any::<u8>(), 0..600)) {
        let mut decoder = FrameDecoder::new();
        decoder.feed_bytes(&noise, |_| {});
        let _ = decoder.feed(0x00);

        let message = Message::new(0x40, &[]).unwrap();
        let mut decoded = None;
        decoder.feed_bytes(&encode_frame(&message).unwrap(), |result| decoded = Some(result));
        prop_assert_eq!(decoded, Some(Ok(message)));
    }
}
