mod close_test;
mod failover_test;
