mod assistant_flows;
