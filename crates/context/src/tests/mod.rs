mod assembly_scenarios;
mod budget_properties;
