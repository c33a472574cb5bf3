mod filter_scenarios;
