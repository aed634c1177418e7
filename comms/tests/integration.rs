use comms::{
    MAX_FRAME_LEN,
    msg::{Command, GradientMsg, Request, Response},
};
use tokio::io::{self, AsyncWriteExt};

#[tokio::test]
async fn send_recv() {
    const SIZE: usize = 128;

    let req = Request::Gradients(GradientMsg {
        worker_id: "strongman".into(),
        epoch: 4,
        gradient: vec![0.5, -0.5, 1.5],
    });

    let (one, two) = io::duplex(SIZE);
    let (rx, tx) = io::split(one);
    let (_, mut tx) = comms::channel(rx, tx);

    let mut frame = Vec::new();
    req.encode(&mut frame);
    tx.send(&frame).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = Vec::new();
    rx.recv_into(&mut buf).await.unwrap();

    assert_eq!(Request::decode(&buf).unwrap(), req);
}

#[tokio::test]
async fn frames_keep_their_boundaries() {
    let (one, two) = io::duplex(1024);
    let (rx, tx) = io::split(one);
    let (_, mut tx) = comms::channel(rx, tx);

    let mut weights = Vec::new();
    Response::Weights {
        command: Command::Continue,
        weights: vec![1.0; 16],
    }
    .encode(&mut weights);

    let mut ack = Vec::new();
    Response::Ack.encode(&mut ack);

    tx.send(&weights).await.unwrap();
    tx.send(&ack).await.unwrap();
    tx.send(&[]).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = Vec::new();
    rx.recv_into(&mut buf).await.unwrap();
    assert_eq!(buf, weights);

    rx.recv_into(&mut buf).await.unwrap();
    assert_eq!(Response::decode(&buf).unwrap(), Response::Ack);

    rx.recv_into(&mut buf).await.unwrap();
    assert!(buf.is_empty());
}

#[tokio::test]
async fn oversized_frame_is_rejected() {
    let (mut one, two) = io::duplex(64);
    one.write_all(&(MAX_FRAME_LEN + 1).to_be_bytes())
        .await
        .unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let err = rx.recv_into(&mut Vec::new()).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[tokio::test]
async fn closed_peer_is_eof() {
    let (one, two) = io::duplex(64);
    drop(one);

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let err = rx.recv_into(&mut Vec::new()).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[tokio::test]
async fn peer_closing_mid_frame_is_invalid_data() {
    let (mut one, two) = io::duplex(64);
    one.write_all(&9u64.to_be_bytes()).await.unwrap();
    one.write_all(&[1, 2]).await.unwrap();
    drop(one);

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let err = rx.recv_into(&mut Vec::new()).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[tokio::test]
async fn peer_closing_mid_header_is_invalid_data() {
    let (mut one, two) = io::duplex(64);
    one.write_all(&[0, 0, 0]).await.unwrap();
    drop(one);

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let err = rx.recv_into(&mut Vec::new()).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}
