use crate::{
    index::{Index, IndexMetrics, OwnerKind},
    k8s::{ConsumerGroup, KafkaSource, Resource},
    requeue::Requeue,
};
use anyhow::{bail, Result};
use clap::Parser;
use kube::runtime::watcher;
use prometheus_client::registry::Registry;
use tokio::sync::mpsc;
use tracing::{info, info_span, Instrument};

#[derive(Debug, Parser)]
#[clap(name = "kafka-source", about = "Routes KafkaSource subordinate changes to their owners")]
pub struct Args {
    #[clap(
        long,
        default_value = "kafka_source_controller=info,warn",
        env = "KAFKA_SOURCE_CONTROLLER_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// The kind of resource that owns watched consumer groups.
    ///
    /// Matched against owner references without regard to case.
    #[clap(long, default_value = "KafkaSource")]
    owner_kind: String,

    /// The maximum number of owner keys to buffer before dropping updates.
    #[clap(long, default_value = "10000")]
    requeue_queue_size: usize,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            admin,
            client,
            log_level,
            log_format,
            owner_kind,
            requeue_queue_size,
        } = self;

        if requeue_queue_size == 0 {
            bail!("--requeue-queue-size must be greater than zero");
        }
        let owner_kind = OwnerKind::new(owner_kind);
        if owner_kind != OwnerKind::of::<KafkaSource>() {
            tracing::warn!(
                kind = %owner_kind.as_str(),
                "Owner kind differs from KafkaSource; keys will be looked up as KafkaSources"
            );
        }

        let mut prom = <Registry>::default();
        let index_metrics = IndexMetrics::register(prom.sub_registry_with_prefix("owner_index"));
        let rt_metrics = kubert::RuntimeMetrics::register(prom.sub_registry_with_prefix("kube"));

        let mut runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_metrics(rt_metrics)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .build()
            .await?;

        let (requeue_tx, requeue_rx) = mpsc::channel(requeue_queue_size);
        let index = Index::shared(owner_kind, requeue_tx, index_metrics);

        // Spawn resource watches.

        let consumer_groups = runtime.watch_all::<ConsumerGroup>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(index, consumer_groups)
                .instrument(info_span!("consumergroups")),
        );

        tokio::spawn(
            Requeue::new(runtime.client(), requeue_rx)
                .run()
                .instrument(info_span!("requeue")),
        );

        info!(
            subordinate = %ConsumerGroup::kind(&()),
            queue = requeue_queue_size,
            "Routing subordinate updates"
        );

        // Block the main thread on the shutdown signal. Once it fires, wait for the background tasks to
        // complete before exiting.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }
}
