//! 接入监听器
//!
//! 构造时绑定端口，`start` 后由接入循环为每个连接派生独立任务处理请求，
//! 连接任务统一放在 `JoinSet` 中。`stop` 停止接受新连接，通知所有连接优雅关闭，
//! 宽限期内未完成的连接任务会被全部终止，`stop` 返回时不再有请求到达下游查看器。

use std::{io, net::SocketAddr, sync::Arc, time::Duration};

use application::ForwardingSink;
use axum::Router;
use config::{GatewayConfig, IngestConfig, ServerConfig};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto::Builder,
    service::TowerToHyperService,
};
use tokio::{
    net::{TcpListener, TcpStream},
    task::{JoinHandle, JoinSet},
};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{BindError, ServerError},
    handler::MessageHandler,
    routes::router,
};

enum ServerState {
    Bound(TcpListener),
    Running {
        /// 停止接受新连接并让已有连接优雅关闭
        shutdown: CancellationToken,
        /// 宽限期已过，终止剩余连接
        force: CancellationToken,
        task: JoinHandle<()>,
    },
    Stopped,
}

pub struct IngestServerBuilder {
    server: ServerConfig,
    ingest: IngestConfig,
    sink: Option<Arc<dyn ForwardingSink>>,
}

impl IngestServerBuilder {
    pub fn sink(mut self, sink: Arc<dyn ForwardingSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn ingest(mut self, ingest: &IngestConfig) -> Self {
        self.ingest = ingest.clone();
        self
    }

    /// 绑定端口。缺少下游查看器或端口不可用时立即失败
    pub async fn bind(self) -> Result<IngestServer, BindError> {
        let Some(sink) = self.sink else {
            tracing::error!("forwarding sink is missing, refusing to build ingest server");
            return Err(BindError::MissingSink);
        };

        let address = self.server.bind_address();
        let socket_addr = resolve(&address).await?;
        let listener = TcpListener::bind(socket_addr)
            .await
            .map_err(|source| BindError::Io {
                address: address.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| BindError::Io { address, source })?;

        let handler =
            MessageHandler::new(sink).with_error_detail(self.ingest.expose_error_detail);

        Ok(IngestServer {
            router: router(handler, &self.ingest),
            local_addr,
            state: ServerState::Bound(listener),
        })
    }
}

async fn resolve(address: &str) -> Result<SocketAddr, BindError> {
    let invalid = |source| BindError::InvalidAddress {
        address: address.to_string(),
        source,
    };
    tokio::net::lookup_host(address)
        .await
        .map_err(invalid)?
        .next()
        .ok_or_else(|| {
            invalid(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "address resolved to nothing",
            ))
        })
}

pub struct IngestServer {
    router: Router,
    local_addr: SocketAddr,
    state: ServerState,
}

impl IngestServer {
    pub fn builder(server: &ServerConfig) -> IngestServerBuilder {
        IngestServerBuilder {
            server: server.clone(),
            ingest: IngestConfig::default(),
            sink: None,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ServerState::Running { .. })
    }

    /// 开始接受连接。重复调用或停止后再调用都是使用错误
    pub fn start(&mut self) -> Result<(), ServerError> {
        let listener = match std::mem::replace(&mut self.state, ServerState::Stopped) {
            ServerState::Bound(listener) => listener,
            running @ ServerState::Running { .. } => {
                self.state = running;
                return Err(ServerError::AlreadyStarted);
            }
            ServerState::Stopped => return Err(ServerError::AlreadyStarted),
        };

        let shutdown = CancellationToken::new();
        let force = CancellationToken::new();
        let task = tokio::spawn(accept_loop(
            listener,
            self.router.clone(),
            shutdown.clone(),
            force.clone(),
        ));

        self.state = ServerState::Running {
            shutdown,
            force,
            task,
        };
        tracing::info!(port = self.local_addr.port(), "Social Stream HTTP server started");
        Ok(())
    }

    /// 停止接受新连接，最多等待 `grace` 让进行中的请求完成，超时后终止剩余连接
    pub async fn stop(&mut self, grace: Duration) -> Result<(), ServerError> {
        let (shutdown, force, mut task) =
            match std::mem::replace(&mut self.state, ServerState::Stopped) {
                ServerState::Running {
                    shutdown,
                    force,
                    task,
                } => (shutdown, force, task),
                bound @ ServerState::Bound(_) => {
                    self.state = bound;
                    return Err(ServerError::NotRunning);
                }
                ServerState::Stopped => return Err(ServerError::NotRunning),
            };

        shutdown.cancel();
        match tokio::time::timeout(grace, &mut task).await {
            Ok(joined) => joined?,
            Err(_) => {
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    "in-flight requests did not finish within grace period, aborting connections"
                );
                force.cancel();
                task.await?;
            }
        }

        tracing::info!(port = self.local_addr.port(), "Social Stream HTTP server stopped");
        Ok(())
    }
}

impl Drop for IngestServer {
    fn drop(&mut self) {
        if let ServerState::Running { shutdown, .. } =
            std::mem::replace(&mut self.state, ServerState::Stopped)
        {
            shutdown.cancel();
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
    force: CancellationToken,
) {
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    connections.spawn(serve_connection(stream, peer, app.clone(), shutdown.clone()));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to accept connection");
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            },
        }
        // 回收已经结束的连接
        while connections.try_join_next().is_some() {}
    }
    drop(listener);

    let mut aborted = false;
    loop {
        tokio::select! {
            joined = connections.join_next() => {
                if joined.is_none() {
                    break;
                }
            }
            _ = force.cancelled(), if !aborted => {
                tracing::debug!(remaining = connections.len(), "aborting open connections");
                connections.abort_all();
                aborted = true;
            }
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    app: Router,
    shutdown: CancellationToken,
) {
    let builder = Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection(TokioIo::new(stream), TowerToHyperService::new(app));
    tokio::pin!(conn);

    let result = tokio::select! {
        result = conn.as_mut() => result,
        _ = shutdown.cancelled() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };
    if let Err(err) = result {
        tracing::debug!(peer = %peer, error = %err, "connection closed with error");
    }
}

/// 构造并启动网关。失败时只记录日志并返回 `None`，由宿主程序跳过该子系统
pub async fn spawn_gateway(
    config: &GatewayConfig,
    sink: Option<Arc<dyn ForwardingSink>>,
) -> Option<IngestServer> {
    let mut builder = IngestServer::builder(&config.server).ingest(&config.ingest);
    if let Some(sink) = sink {
        builder = builder.sink(sink);
    }

    let mut server = match builder.bind().await {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(error = %err, "failed to set up Social Stream HTTP server");
            return None;
        }
    };

    match server.start() {
        Ok(()) => Some(server),
        Err(err) => {
            tracing::error!(error = %err, "failed to start Social Stream HTTP server");
            None
        }
    }
}
