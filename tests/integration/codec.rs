//! Encoding and decoding through the codec boundary.

use crate::common::fixtures::{data_with_interfaces, full_schema, interface_path};
use crate::common::providers::LineCodec;
use yang_path::error::CodecErrorCode;
use yang_path::{CodecService, EncodingFormat, ValidationService};

#[test]
fn test_round_trip_through_codec() {
    let schema = full_schema();
    let mut data = data_with_interfaces(&schema, &["eth0", "it's"]);
    let root = data.root();
    data.create(root, &interface_path("eth0", "address[.='10.0.0.1/24']"), "")
        .unwrap();
    data.create(root, &interface_path("it's", "interfaces-ext:speed"), "auto")
        .unwrap();

    let codec = LineCodec;
    let encoded = codec.encode(&data, root, EncodingFormat::Json, true).unwrap();
    let decoded = codec
        .decode(schema.clone(), &encoded, EncodingFormat::Json)
        .unwrap();

    assert_eq!(decoded.len(), data.len());
    assert_eq!(
        codec.encode(&decoded, decoded.root(), EncodingFormat::Json, true).unwrap(),
        encoded
    );
    assert!(ValidationService::new().validate_tree(&decoded).is_ok());

    let speed = decoded
        .find(decoded.root(), &interface_path("it's", "interfaces-ext:speed"))
        .unwrap();
    assert_eq!(decoded.get(speed[0]), "auto");
}

#[test]
fn test_unsupported_format() {
    let data = data_with_interfaces(&full_schema(), &["eth0"]);
    let err = LineCodec
        .encode(&data, data.root(), EncodingFormat::Xml, false)
        .unwrap_err();
    assert_eq!(err.code, CodecErrorCode::InvalidMarkup);
}

#[test]
fn test_decode_unknown_node() {
    let err = LineCodec
        .decode(
            full_schema(),
            "/interfaces:interfaces/interface[name='eth0']/bogus\t1",
            EncodingFormat::Json,
        )
        .unwrap_err();
    assert_eq!(err.code, CodecErrorCode::InvalidMarkup);
    assert!(err.message.contains("bogus"));
}
