use anyhow::{Context as AnyhowContext, Result};
use std::net::SocketAddr;

/// Where `serve-http` is about to listen, checked against `--public`.
#[derive(Debug)]
pub(crate) struct BindPlan {
    bind: String,
    addrs: Vec<SocketAddr>,
}

impl BindPlan {
    /// Resolve `bind` and refuse it if any resolved address is reachable from
    /// other hosts and `public` is not set.
    pub(crate) async fn resolve(bind: &str, public: bool) -> Result<Self> {
        // Tokio's resolver so "localhost:8000" is accepted.
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(bind)
            .await
            .with_context(|| format!("Cannot resolve bind address {bind}"))?
            .collect();
        if addrs.is_empty() {
            anyhow::bail!("Bind address {bind} resolved to nothing");
        }

        let plan = Self {
            bind: bind.to_string(),
            addrs,
        };
        plan.check(public)?;
        Ok(plan)
    }

    fn check(&self, public: bool) -> Result<()> {
        let exposed = self.exposed();
        if public || exposed.is_empty() {
            return Ok(());
        }
        anyhow::bail!(
            "Refusing to bind {} ({}): the remap API has no authentication and would be \
             reachable from other hosts. Use a loopback address or pass --public.",
            self.bind,
            join(&exposed)
        )
    }

    /// Resolved addresses that are not loopback
    pub(crate) fn exposed(&self) -> Vec<SocketAddr> {
        self.addrs
            .iter()
            .copied()
            .filter(|addr| !addr.ip().is_loopback())
            .collect()
    }

    pub(crate) fn describe(&self) -> String {
        format!("{} -> {}", self.bind, join(&self.addrs))
    }
}

fn join(addrs: &[SocketAddr]) -> String {
    addrs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(bind: &str) -> BindPlan {
        BindPlan {
            bind: bind.to_string(),
            addrs: vec![bind.parse().unwrap()],
        }
    }

    #[tokio::test]
    async fn loopback_binds_need_no_flag() {
        let plan = BindPlan::resolve("127.0.0.1:0", false).await.unwrap();
        assert!(plan.exposed().is_empty());
    }

    #[tokio::test]
    async fn wildcard_bind_requires_public() {
        let err = BindPlan::resolve("0.0.0.0:0", false).await.unwrap_err();
        assert!(err.to_string().contains("Refusing to bind 0.0.0.0:0"));

        let plan = BindPlan::resolve("0.0.0.0:0", true).await.unwrap();
        assert_eq!(plan.exposed().len(), 1);
    }

    #[test]
    fn refusal_names_the_exposed_addresses() {
        let err = plan("10.0.0.5:8000").check(false).unwrap_err().to_string();
        assert!(err.contains("(10.0.0.5:8000)"), "{err}");
        assert!(err.contains("--public"), "{err}");

        plan("[::1]:8000").check(false).unwrap();
        plan("10.0.0.5:8000").check(true).unwrap();
    }

    #[test]
    fn describe_lists_resolved_addresses() {
        assert_eq!(plan("127.0.0.1:8000").describe(), "127.0.0.1:8000 -> 127.0.0.1:8000");
    }
}
