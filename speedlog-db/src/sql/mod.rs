pub mod speedtest_results;
