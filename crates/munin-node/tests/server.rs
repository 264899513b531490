//! Transport tests over in-memory pipes and real sockets.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::watch;

use munin_core::MetricRegistry;
use munin_node::obs::NodeMetrics;
use munin_node::transport::{run_session, MAX_LINE};
use munin_node::{CommandProcessor, Graph, GraphRegistry, Reporter, StaticGraphProvider, StaticHostname};

fn processor(metrics: &MetricRegistry) -> Arc<CommandProcessor> {
    let graph = Graph::builder("foo", "gr", "t")
        .data_source("gr.t1.n1")
        .build()
        .unwrap();
    let graphs = GraphRegistry::new();
    graphs.add_provider(Arc::new(StaticGraphProvider::new([graph])));
    Arc::new(CommandProcessor::new(
        metrics.clone(),
        Arc::new(graphs),
        Arc::new(StaticHostname::new("somehost")),
    ))
}

/// Run a session against `input` and return everything it wrote.
async fn session(processor: Arc<CommandProcessor>, obs: Option<Arc<NodeMetrics>>, input: &str) -> String {
    session_bytes(processor, obs, input.as_bytes()).await
}

async fn session_bytes(processor: Arc<CommandProcessor>, obs: Option<Arc<NodeMetrics>>, input: &[u8]) -> String {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let (_tx, rx) = watch::channel(false);
    let task = tokio::spawn(run_session(server, processor, obs, rx));

    let (mut read, mut write) = tokio::io::split(client);
    write.write_all(input).await.unwrap();
    write.shutdown().await.unwrap();

    let mut out = String::new();
    read.read_to_string(&mut out).await.unwrap();
    task.await.unwrap().unwrap();
    out
}

#[tokio::test]
async fn greets_and_answers_in_order() {
    let metrics = MetricRegistry::new();
    metrics.counter("gr.t1.n1").unwrap().inc_by(2);

    let out = session(processor(&metrics), None, "list\n\nfetch foo\nnodes\nquit\nlist\n").await;
    assert_eq!(
        out,
        "# munin node at somehost\nfoo\ngr_t1_n1__count.value 2\n.\nsomehost\n.\n"
    );
}

#[tokio::test]
async fn errors_keep_the_connection_open() {
    let metrics = MetricRegistry::new();
    metrics.meter("gr.t1.n1").unwrap();
    let graph = Graph::builder("bad", "gr", "t")
        .data_source_with(
            "gr.t1.n1",
            None,
            Some("counter.count".parse().unwrap()),
            Default::default(),
        )
        .build()
        .unwrap();
    let p = processor(&metrics);
    p.graphs().add_provider(Arc::new(StaticGraphProvider::new([graph])));

    let out = session(p, None, "cap multigraph\r\nfetch bad\nfetch missing\n").await;
    assert_eq!(
        out,
        concat!(
            "# munin node at somehost\n",
            "# Unknown command. Try list, nodes, config, fetch, version or quit\n",
            "# Bad exit\n.\n",
            "# unknown service\n.\n",
        )
    );
}

#[tokio::test]
async fn invalid_utf8_line_is_an_unknown_command() {
    let out = session_bytes(processor(&MetricRegistry::new()), None, b"\xff\xfe list\nlist\n").await;
    assert_eq!(
        out,
        concat!(
            "# munin node at somehost\n",
            "# Unknown command. Try list, nodes, config, fetch, version or quit\n",
            "foo\n",
        )
    );
}

#[tokio::test]
async fn overlong_line_is_drained_and_rejected() {
    let mut input = vec![b'x'; MAX_LINE * 2 + 17];
    input.extend_from_slice(b"\nlist\n");

    let out = session_bytes(processor(&MetricRegistry::new()), None, &input).await;
    assert_eq!(
        out,
        concat!(
            "# munin node at somehost\n",
            "# Unknown command. Try list, nodes, config, fetch, version or quit\n",
            "foo\n",
        )
    );
}

#[tokio::test]
async fn line_at_the_limit_is_accepted() {
    let mut input = b"list".to_vec();
    input.resize(MAX_LINE - 1, b' ');
    input.extend_from_slice(b"\nnodes\n");

    let out = session_bytes(processor(&MetricRegistry::new()), None, &input).await;
    assert_eq!(out, "# munin node at somehost\nfoo\nsomehost\n.\n");
}

#[tokio::test]
async fn session_records_node_metrics() {
    let metrics = MetricRegistry::new();
    let obs = Arc::new(NodeMetrics::register(&metrics).unwrap());

    session(processor(&metrics), Some(Arc::clone(&obs)), "list\nfetch foo\nversion\n").await;

    assert_eq!(metrics.meter(munin_node::obs::metrics::COMMANDS).unwrap().count(), 3);
    assert_eq!(metrics.timer(munin_node::obs::metrics::FETCH).unwrap().count(), 1);
}

#[tokio::test]
async fn shutdown_ends_idle_session() {
    let (_client, server) = tokio::io::duplex(1024);
    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(run_session(server, processor(&MetricRegistry::new()), None, rx));

    tx.send(true).unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn reporter_serves_a_real_socket() {
    let metrics = MetricRegistry::new();
    metrics.counter("gr.t1.n1").unwrap().inc();

    let graph = Graph::builder("foo", "gr", "t")
        .data_source("gr.t1.n1")
        .build()
        .unwrap();
    let reporter = Reporter::builder(metrics)
        .listen("127.0.0.1:0".parse().unwrap())
        .hostname(Arc::new(StaticHostname::new("somehost")))
        .provider(Arc::new(StaticGraphProvider::new([graph])))
        .instrument(true)
        .build()
        .unwrap();

    let addr = reporter.start().await.unwrap();
    assert_eq!(reporter.start().await.unwrap(), addr);

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    assert_eq!(lines.next_line().await.unwrap().unwrap(), "# munin node at somehost");

    write.write_all(b"list\n").await.unwrap();
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "foo munin_node");

    write.write_all(b"fetch foo\n").await.unwrap();
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "gr_t1_n1__count.value 1");
    assert_eq!(lines.next_line().await.unwrap().unwrap(), ".");

    write.write_all(b"fetch munin_node\n").await.unwrap();
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "connections__gauge.value 1");
    let commands = lines.next_line().await.unwrap().unwrap();
    assert!(commands.starts_with("commands__one_minute_rate.value "), "{commands}");
    let fetch = lines.next_line().await.unwrap().unwrap();
    assert!(fetch.starts_with("fetch__one_minute_rate.value "), "{fetch}");
    assert_eq!(lines.next_line().await.unwrap().unwrap(), ".");

    write.write_all(b"quit\n").await.unwrap();
    assert!(lines.next_line().await.unwrap().is_none());

    reporter.stop().await;
    assert!(reporter.local_addr().is_none());
    assert!(TcpStream::connect(addr).await.is_err());
}
