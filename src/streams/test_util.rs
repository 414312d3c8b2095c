/// Runs `f` on a `LocalSet` so stream tasks can be spawned with `spawn_local`.
pub async fn local_test<F, Fut>(f: F)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = ()> + 'static,
{
    let local = tokio::task::LocalSet::new();
    local.run_until(f()).await;
}
