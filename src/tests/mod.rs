mod canonical_scenarios;
