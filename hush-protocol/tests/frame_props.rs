//! Property tests for frame encoding and the receive path

use hush_hal::mock::{FakeClock, ScriptedUart};
use hush_protocol::{Address, Frame, Link, LinkTiming, Reception, MAX_PAYLOAD_SIZE};
use proptest::prelude::*;

fn address() -> impl Strategy<Value = Address> {
    prop_oneof![
        Just(Address::Master),
        Just(Address::Heartbeat),
        Just(Address::Crying),
        Just(Address::Motor),
    ]
}

fn remote() -> impl Strategy<Value = Address> {
    prop_oneof![
        Just(Address::Heartbeat),
        Just(Address::Crying),
        Just(Address::Motor),
    ]
}

proptest! {
    #[test]
    fn test_encode_decode_roundtrip(
        dest in address(),
        src in address(),
        payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
    ) {
        let frame = Frame::new(dest, src, &payload).unwrap();
        let encoded = frame.encode_to_vec().unwrap();
        prop_assert_eq!(encoded.len(), 3 + payload.len());

        let (decoded, used) = Frame::decode(&encoded).unwrap();
        prop_assert_eq!(used, encoded.len());
        prop_assert_eq!(decoded.dest, dest);
        prop_assert_eq!(decoded.src, src);
        prop_assert_eq!(&decoded.payload[..], &payload[..]);
    }

    #[test]
    fn test_stream_receive_roundtrip(
        src in remote(),
        payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
    ) {
        let clock = FakeClock::new();
        let mut link = Link::new(ScriptedUart::new(&clock), &clock, Address::Master, LinkTiming::default());
        let frame = Frame::new(Address::Master, src, &payload).unwrap();
        link.uart_mut().push_rx(&frame.encode_to_vec().unwrap()).unwrap();

        prop_assert_eq!(link.receive_one(), Ok(Reception::Frame(frame)));
        prop_assert_eq!(link.uart().pending_rx(), 0);
    }

    #[test]
    fn test_misaddressed_frame_keeps_alignment(
        other in remote(),
        sender in address(),
        skipped in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
        wanted in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
    ) {
        let clock = FakeClock::new();
        let mut link = Link::new(ScriptedUart::new(&clock), &clock, Address::Master, LinkTiming::default());

        let first = Frame::new(other, sender, &skipped).unwrap();
        let second = Frame::new(Address::Master, Address::Heartbeat, &wanted).unwrap();
        link.uart_mut().push_rx(&first.encode_to_vec().unwrap()).unwrap();
        link.uart_mut().push_rx(&second.encode_to_vec().unwrap()).unwrap();

        prop_assert_eq!(link.receive_one(), Ok(Reception::NotForMe));
        prop_assert_eq!(link.receive_one(), Ok(Reception::Frame(second)));
    }
}
