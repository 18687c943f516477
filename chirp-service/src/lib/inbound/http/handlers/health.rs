/// Liveness probe. Plain text on purpose, load balancers do not parse JSON.
pub async fn healthz() -> &'static str {
    "OK"
}
